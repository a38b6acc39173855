mod common;
mod titles;
