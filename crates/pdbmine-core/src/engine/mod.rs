//! Execution support shared by the workflows.
//!
//! [`progress`] defines the events a workflow emits so that front ends can
//! render spinners and progress bars without the library depending on a
//! terminal.

pub mod progress;
