pub mod page_store;
pub mod title_validator;

pub use page_store::PageStore;
pub use title_validator::TitleValidator;
