pub(crate) mod accounting;
pub(crate) mod cap;
pub(crate) mod curriculum;
pub(crate) mod questions;
pub(crate) mod secondary;
pub(crate) mod visa;
