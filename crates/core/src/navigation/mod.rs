#![allow(missing_docs)]

//! Screen routing, modal state and the small cursors that hang off them.

mod carousel;
mod modal;
mod router;

pub use carousel::Carousel;
pub use modal::{ModalContent, ModalId, ModalStack, VisibleModal};
pub use router::{NavIndicator, ProfileTab, ScreenId, ScreenRouter, TabSwitcher};
