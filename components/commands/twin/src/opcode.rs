//! Opcode table.
//!
//! Command ids are six bits wide. Slots the hardware does not define map
//! to `None` and decode as an invalid opcode.

/// Every command the display processor accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Noop,
    FillTriangle,
    FillZTriangle,
    TextureTriangle,
    TextureZTriangle,
    ShadeTriangle,
    ShadeZTriangle,
    ShadeTextureTriangle,
    ShadeTextureZTriangle,
    TextureRectangle,
    TextureRectangleFlip,
    SyncLoad,
    SyncPipe,
    SyncTile,
    SyncFull,
    SetKeyGb,
    SetKeyR,
    SetConvert,
    SetScissor,
    SetPrimDepth,
    SetOtherModes,
    LoadTlut,
    SetTileSize,
    LoadBlock,
    LoadTile,
    SetTile,
    FillRectangle,
    SetFillColor,
    SetFogColor,
    SetBlendColor,
    SetPrimColor,
    SetEnvColor,
    SetCombineMode,
    SetTextureImage,
    SetZImage,
    SetColorImage,
}

/// Which coefficient blocks follow the edge block of a triangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriangleShape {
    pub shade: bool,
    pub texture: bool,
    pub zbuffer: bool,
}

impl TriangleShape {
    const EDGE_BYTES: usize = 32;
    const SHADE_BYTES: usize = 64;
    const TEXTURE_BYTES: usize = 64;
    const Z_BYTES: usize = 16;

    #[must_use]
    pub const fn new(shade: bool, texture: bool, zbuffer: bool) -> Self {
        Self {
            shade,
            texture,
            zbuffer,
        }
    }

    /// Total command length in bytes.
    #[must_use]
    pub const fn size(&self) -> usize {
        let mut size = Self::EDGE_BYTES;
        if self.shade {
            size += Self::SHADE_BYTES;
        }
        if self.texture {
            size += Self::TEXTURE_BYTES;
        }
        if self.zbuffer {
            size += Self::Z_BYTES;
        }
        size
    }
}

use Opcode::*;

const TABLE: [Option<Opcode>; 64] = {
    let mut t = [None; 64];
    t[0x00] = Some(Noop);
    t[0x08] = Some(FillTriangle);
    t[0x09] = Some(FillZTriangle);
    t[0x0A] = Some(TextureTriangle);
    t[0x0B] = Some(TextureZTriangle);
    t[0x0C] = Some(ShadeTriangle);
    t[0x0D] = Some(ShadeZTriangle);
    t[0x0E] = Some(ShadeTextureTriangle);
    t[0x0F] = Some(ShadeTextureZTriangle);
    t[0x24] = Some(TextureRectangle);
    t[0x25] = Some(TextureRectangleFlip);
    t[0x26] = Some(SyncLoad);
    t[0x27] = Some(SyncPipe);
    t[0x28] = Some(SyncTile);
    t[0x29] = Some(SyncFull);
    t[0x2A] = Some(SetKeyGb);
    t[0x2B] = Some(SetKeyR);
    t[0x2C] = Some(SetConvert);
    t[0x2D] = Some(SetScissor);
    t[0x2E] = Some(SetPrimDepth);
    t[0x2F] = Some(SetOtherModes);
    t[0x30] = Some(LoadTlut);
    t[0x32] = Some(SetTileSize);
    t[0x33] = Some(LoadBlock);
    t[0x34] = Some(LoadTile);
    t[0x35] = Some(SetTile);
    t[0x36] = Some(FillRectangle);
    t[0x37] = Some(SetFillColor);
    t[0x38] = Some(SetFogColor);
    t[0x39] = Some(SetBlendColor);
    t[0x3A] = Some(SetPrimColor);
    t[0x3B] = Some(SetEnvColor);
    t[0x3C] = Some(SetCombineMode);
    t[0x3D] = Some(SetTextureImage);
    t[0x3E] = Some(SetZImage);
    t[0x3F] = Some(SetColorImage);
    t
};

impl Opcode {
    /// Look up a command id. The two high bits are ignored.
    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        TABLE[(id & 0x3F) as usize]
    }

    /// Six-bit command id.
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Noop => 0x00,
            FillTriangle => 0x08,
            FillZTriangle => 0x09,
            TextureTriangle => 0x0A,
            TextureZTriangle => 0x0B,
            ShadeTriangle => 0x0C,
            ShadeZTriangle => 0x0D,
            ShadeTextureTriangle => 0x0E,
            ShadeTextureZTriangle => 0x0F,
            TextureRectangle => 0x24,
            TextureRectangleFlip => 0x25,
            SyncLoad => 0x26,
            SyncPipe => 0x27,
            SyncTile => 0x28,
            SyncFull => 0x29,
            SetKeyGb => 0x2A,
            SetKeyR => 0x2B,
            SetConvert => 0x2C,
            SetScissor => 0x2D,
            SetPrimDepth => 0x2E,
            SetOtherModes => 0x2F,
            LoadTlut => 0x30,
            SetTileSize => 0x32,
            LoadBlock => 0x33,
            LoadTile => 0x34,
            SetTile => 0x35,
            FillRectangle => 0x36,
            SetFillColor => 0x37,
            SetFogColor => 0x38,
            SetBlendColor => 0x39,
            SetPrimColor => 0x3A,
            SetEnvColor => 0x3B,
            SetCombineMode => 0x3C,
            SetTextureImage => 0x3D,
            SetZImage => 0x3E,
            SetColorImage => 0x3F,
        }
    }

    /// Assembler mnemonic.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Noop => "No_Op",
            FillTriangle => "Fill_Triangle",
            FillZTriangle => "Fill_ZBuffer_Triangle",
            TextureTriangle => "Texture_Triangle",
            TextureZTriangle => "Texture_ZBuffer_Triangle",
            ShadeTriangle => "Shade_Triangle",
            ShadeZTriangle => "Shade_ZBuffer_Triangle",
            ShadeTextureTriangle => "Shade_Texture_Triangle",
            ShadeTextureZTriangle => "Shade_Texture_Z_Buffer_Triangle",
            TextureRectangle => "Texture_Rectangle",
            TextureRectangleFlip => "Texture_Rectangle_Flip",
            SyncLoad => "Sync_Load",
            SyncPipe => "Sync_Pipe",
            SyncTile => "Sync_Tile",
            SyncFull => "Sync_Full",
            SetKeyGb => "Set_Key_GB",
            SetKeyR => "Set_Key_R",
            SetConvert => "Set_Convert",
            SetScissor => "Set_Scissor",
            SetPrimDepth => "Set_Prim_Depth",
            SetOtherModes => "Set_Other_Modes",
            LoadTlut => "Load_Tlut",
            SetTileSize => "Set_Tile_Size",
            LoadBlock => "Load_Block",
            LoadTile => "Load_Tile",
            SetTile => "Set_Tile",
            FillRectangle => "Fill_Rectangle",
            SetFillColor => "Set_Fill_Color",
            SetFogColor => "Set_Fog_Color",
            SetBlendColor => "Set_Blend_Color",
            SetPrimColor => "Set_Prim_Color",
            SetEnvColor => "Set_Env_Color",
            SetCombineMode => "Set_Combine_Mode",
            SetTextureImage => "Set_Texture_Image",
            SetZImage => "Set_Z_Image",
            SetColorImage => "Set_Color_Image",
        }
    }

    /// Coefficient blocks carried by triangle commands; `None` for
    /// everything else.
    #[must_use]
    pub const fn triangle_shape(self) -> Option<TriangleShape> {
        match self {
            FillTriangle => Some(TriangleShape::new(false, false, false)),
            FillZTriangle => Some(TriangleShape::new(false, false, true)),
            TextureTriangle => Some(TriangleShape::new(false, true, false)),
            TextureZTriangle => Some(TriangleShape::new(false, true, true)),
            ShadeTriangle => Some(TriangleShape::new(true, false, false)),
            ShadeZTriangle => Some(TriangleShape::new(true, false, true)),
            ShadeTextureTriangle => Some(TriangleShape::new(true, true, false)),
            ShadeTextureZTriangle => Some(TriangleShape::new(true, true, true)),
            _ => None,
        }
    }

    /// Command length in bytes.
    #[must_use]
    pub const fn size(self) -> usize {
        match self.triangle_shape() {
            Some(shape) => shape.size(),
            None => match self {
                TextureRectangle | TextureRectangleFlip => 16,
                _ => 8,
            },
        }
    }
}
