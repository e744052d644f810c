mod common;
mod entries;
mod verify;
