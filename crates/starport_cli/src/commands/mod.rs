pub(crate) mod all;
pub(crate) mod export;
pub(crate) mod meta;
pub(crate) mod page;
pub(crate) mod shared;
