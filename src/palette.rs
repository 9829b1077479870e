//! Color palette for agentctl terminal output.

pub const BLUE_RGB: (u8, u8, u8) = (59, 130, 246);
pub const RED_RGB: (u8, u8, u8) = (239, 68, 68);
pub const ORANGE_RGB: (u8, u8, u8) = (249, 115, 22);
pub const GREEN_RGB: (u8, u8, u8) = (74, 222, 128);
pub const YELLOW_RGB: (u8, u8, u8) = (250, 204, 21);
pub const SLATE_RGB: (u8, u8, u8) = (100, 116, 139);
pub const MAGENTA_RGB: (u8, u8, u8) = (217, 70, 160);
