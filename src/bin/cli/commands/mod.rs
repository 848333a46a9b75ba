pub mod add;
pub mod edit;
pub mod export;
pub mod list;
pub mod remove;
pub mod rename;
pub mod stacks;
