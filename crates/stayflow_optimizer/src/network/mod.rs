pub mod flow_arc;
pub mod flow_network;
pub mod node;
