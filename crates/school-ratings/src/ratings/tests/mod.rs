mod common;
mod normalization;
