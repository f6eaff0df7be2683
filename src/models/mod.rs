pub mod category;
pub mod driver;
pub mod item;
pub mod money;
pub mod order;
pub mod product;
pub mod user;

pub use category::*;
pub use driver::*;
pub use item::*;
pub use money::*;
pub use order::*;
pub use product::*;
pub use user::*;
