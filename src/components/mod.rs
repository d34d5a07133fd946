pub mod keyword_graph;
