pub mod assistant;
pub mod locale;
pub mod moderation;
pub mod nutrition;
pub mod pantry;
pub mod recipe;
pub mod subscription;
pub mod translation;
