//! # Chatloom - Chatflow Document Builder
//!
//! **Chatloom** assembles directed-graph "chatflow" documents — nodes, edges
//! and conversation variables — from either a natural-language description or
//! an explicit sequence of structured steps, and serializes them into the
//! stable wire format consumed by downstream canvas tooling.
//!
//! ## Core Workflow
//!
//! The crate is organized around the [`flow::FlowBuilder`]:
//!
//! 1.  **Describe**: parse a free-text description with [`parse::Parser`]
//!     into structured steps, or construct [`step::Step`] values directly.
//! 2.  **Build**: apply the steps with [`step::apply_steps`] (or call the
//!     builder's `add_*` operations yourself). Each functional node gets a
//!     wrapper, an automatic canvas position, and — by default — an edge
//!     from whatever was added before it.
//! 3.  **Export**: [`flow::FlowBuilder::export`] produces the complete
//!     [`flow::FlowDocument`], ready to render as JSON.
//! 4.  **Persist**: hand the document to [`storage::StorageClient`] to push
//!     it to object storage, or save it to a file.
//!
//! ## Quick Start
//!
//! ```
//! use chatloom::prelude::*;
//!
//! let mut builder = FlowBuilder::new("customer_intake")
//!     .with_description("Collect a customer's name and thank them");
//!
//! builder.add_entry()?;
//! builder.add_text_reply("Hi! What's your name?", "Response", true);
//! builder.add_capture_reply("name", Some("customer name"), "Capture", true);
//! builder.add_text_reply("Thanks, {{name}}!", "Response", true);
//!
//! let document = builder.export();
//! assert_eq!(document.nodes.len(), 7); // entry + 3 functional/wrapper pairs
//! assert_eq!(document.edges.len(), 3);
//! assert!(document.validate().is_valid());
//!
//! let json = document.to_json_string()?;
//! assert!(json.contains("\"start_node_uuid\""));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Condition nodes fan out through branch handles, and wiring a later node
//! back to an earlier wrapper is allowed — retry loops are ordinary edges:
//!
//! ```
//! use chatloom::prelude::*;
//!
//! let mut builder = FlowBuilder::new("age_gate");
//! builder.add_entry()?;
//! let capture = builder.add_capture_reply("age", None, "Capture", true);
//! let branches = vec![
//!     BranchSpec::new(
//!         "adult",
//!         LogicalOperator::And,
//!         vec![ComparisonClause::variable("age", ">=", "18")],
//!     ),
//!     BranchSpec::catch_all(),
//! ];
//! let (condition, branch_ids) = builder.add_condition(&branches, "Condition", true);
//! let ok = builder.add_text_reply("Welcome!", "Response", false);
//! builder.connect_branch(&condition, &branch_ids[0], &ok);
//! // Retry: the catch-all loops back to the capture node.
//! builder.connect_branch(&condition, &branch_ids[1], &capture);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod flow;
pub mod ident;
pub mod layout;
pub mod node;
pub mod parse;
pub mod prelude;
pub mod step;
pub mod storage;
