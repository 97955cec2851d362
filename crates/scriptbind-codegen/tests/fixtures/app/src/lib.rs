pub mod scripts;
pub mod util;
