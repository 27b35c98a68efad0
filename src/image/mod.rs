pub mod edge_map;
pub mod io;
pub mod traits;

pub use self::edge_map::{EdgeMap, EDGE};
pub use self::traits::{ImageView, Rows};
