mod cart;
mod catalog;
mod detail;

pub use cart::draw_cart;
pub use catalog::draw_catalog;
pub use detail::draw_detail;
