pub mod controls;
pub mod datatable;
pub mod debug;
pub mod filter_bar;
pub mod help;
pub mod pagination;
