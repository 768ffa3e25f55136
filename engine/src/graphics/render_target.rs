//! Framebuffer collaborator interface
//!
//! The editor viewport renders into an off-screen framebuffer with a colour
//! attachment and an integer picking attachment holding entity ids.

/// Colour attachment index
pub const COLOR_ATTACHMENT: u32 = 0;
/// Picking attachment index; pixels hold an entity id or [`NO_ENTITY`]
pub const ENTITY_ID_ATTACHMENT: u32 = 1;
/// Picking value for pixels not covered by any entity
pub const NO_ENTITY: i32 = -1;

/// Off-screen render target owned by the render backend
pub trait FrameBuffer {
    /// Resize every attachment
    fn resize(&mut self, width: u32, height: u32);

    /// Current size as (width, height)
    fn size(&self) -> (u32, u32);

    /// Read one integer pixel of an attachment
    ///
    /// Coordinates outside the target return [`NO_ENTITY`].
    fn read_pixel(&self, attachment: u32, x: i32, y: i32) -> i32;
}
