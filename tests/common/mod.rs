pub mod synthetic_edges;
