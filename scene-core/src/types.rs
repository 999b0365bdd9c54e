/// Background color as 8-bit RGB channels.
///
/// Channel values map straight onto the renderer's color inputs; no gamma
/// or premultiplication is applied anywhere in the core.
pub type Rgb = [u8; 3];
