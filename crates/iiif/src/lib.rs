pub mod builder;
pub mod canvas;
pub mod collection;
pub mod image_service;
pub mod manifest;
pub mod model;
pub mod publish;
