pub mod chat_controller;
pub mod logs_controller;
pub mod search_controller;
