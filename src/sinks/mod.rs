pub mod epub;
pub mod html;
