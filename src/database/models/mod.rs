pub mod account;
pub mod suggestion;
pub mod suggestion_box;

pub use account::{Account, NewAccount, PublicAccount};
pub use suggestion::{NewSuggestion, Suggestion};
pub use suggestion_box::{BoxChanges, NewBox, SuggestionBox, DEFAULT_BOX_COLOR};
