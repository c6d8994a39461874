//! HTTP request handlers.

pub(crate) mod assets;
pub(crate) mod navigation;
pub(crate) mod pages;
pub(crate) mod site;
