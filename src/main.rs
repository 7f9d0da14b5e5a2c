mod analysis;
mod app;
mod components;
mod config;
mod enhancement;
mod image_pipeline;
mod message;
mod model;
mod utils;
mod views;

pub fn main() -> iced::Result {
    app::run()
}
