mod recording;
mod support;
mod voice_controller;
