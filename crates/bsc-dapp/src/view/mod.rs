mod dapp_view;
mod theme;

pub use dapp_view::{ActionKind, DappView, Intent};
pub use theme::{Theme, ThemeKind};
