mod chunk;
mod common;
mod render;
