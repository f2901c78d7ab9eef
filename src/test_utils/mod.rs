#![allow(missing_docs)]

pub(crate) mod adapter;

pub(crate) use adapter::{Call, ScriptedAdapter};
