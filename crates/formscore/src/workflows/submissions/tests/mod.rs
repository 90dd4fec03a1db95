mod common;
mod sampling;
