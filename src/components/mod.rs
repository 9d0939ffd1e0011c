pub mod force_graph;
pub mod node_panel;
pub mod topic_form;
