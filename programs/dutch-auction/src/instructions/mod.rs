pub mod approve_item;
pub mod award_item;
pub mod buy;
pub mod create_auction;
pub mod get_price;
pub mod initialize_collection;
pub mod withdraw_proceeds;

pub use approve_item::*;
pub use award_item::*;
pub use buy::*;
pub use create_auction::*;
pub use get_price::*;
pub use initialize_collection::*;
pub use withdraw_proceeds::*;
