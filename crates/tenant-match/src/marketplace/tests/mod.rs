mod common;
mod matching;
mod routing;
mod scoring;
