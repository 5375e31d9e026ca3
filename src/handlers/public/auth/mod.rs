// Public authentication handlers: account creation and token acquisition.

pub mod login;
pub mod refresh;
pub mod signup;
pub mod utils;

pub use login::login;
pub use refresh::refresh;
pub use signup::signup;
