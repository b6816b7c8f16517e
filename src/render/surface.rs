use crate::foundation::core::SurfaceSize;
use crate::foundation::error::{PreviewError, PreviewResult};
use crate::render::FrameRGBA;
use crate::render::painter::Painter;

/// Owned raster target: a pixmap plus a reusable render context.
pub struct Surface {
    width: u16,
    height: u16,
    dpr: f64,
    pixmap: vello_cpu::Pixmap,
    ctx: Option<vello_cpu::RenderContext>,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("dpr", &self.dpr)
            .finish_non_exhaustive()
    }
}

impl Surface {
    /// Surface of `size` device pixels at the given device pixel ratio.
    pub fn new(size: SurfaceSize, device_pixel_ratio: f64) -> PreviewResult<Self> {
        let (width, height) = device_dims(size)?;
        let dpr = check_dpr(device_pixel_ratio)?;
        Ok(Self {
            width,
            height,
            dpr,
            pixmap: vello_cpu::Pixmap::new(width, height),
            ctx: None,
        })
    }

    /// Resize in place; the pixmap is only reallocated when the pixel size changes.
    pub fn resize(&mut self, size: SurfaceSize, device_pixel_ratio: f64) -> PreviewResult<()> {
        let (width, height) = device_dims(size)?;
        self.dpr = check_dpr(device_pixel_ratio)?;
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.pixmap = vello_cpu::Pixmap::new(width, height);
        }
        Ok(())
    }

    pub fn size(&self) -> SurfaceSize {
        SurfaceSize {
            width: u32::from(self.width),
            height: u32::from(self.height),
        }
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.dpr
    }

    /// Size in CSS pixels, the space renderers lay out in.
    pub fn css_size(&self) -> (f64, f64) {
        (
            f64::from(self.width) / self.dpr,
            f64::from(self.height) / self.dpr,
        )
    }

    /// Paint one frame. The closure's drawing replaces the previous contents.
    pub(crate) fn paint<R>(&mut self, f: impl FnOnce(&mut Painter<'_>) -> R) -> R {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == self.width && ctx.height() == self.height => ctx,
            _ => vello_cpu::RenderContext::new(self.width, self.height),
        };
        ctx.reset();
        let out = {
            let mut painter = Painter::new(&mut ctx, self.dpr);
            f(&mut painter)
        };
        ctx.flush();
        ctx.render_to_pixmap(&mut self.pixmap);
        self.ctx = Some(ctx);
        out
    }

    /// Copy of the current pixels (premultiplied RGBA8).
    pub fn frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    /// Premultiplied RGBA of one device pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= u32::from(self.width) || y >= u32::from(self.height) {
            return None;
        }
        let i = (y as usize * usize::from(self.width) + x as usize) * 4;
        let px = self.pixmap.data_as_u8_slice().get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

fn device_dims(size: SurfaceSize) -> PreviewResult<(u16, u16)> {
    let w: u16 = size
        .width
        .try_into()
        .map_err(|_| PreviewError::render("surface width exceeds u16"))?;
    let h: u16 = size
        .height
        .try_into()
        .map_err(|_| PreviewError::render("surface height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(PreviewError::render("surface width/height must be > 0"));
    }
    Ok((w, h))
}

fn check_dpr(dpr: f64) -> PreviewResult<f64> {
    if dpr.is_finite() && dpr > 0.0 {
        Ok(dpr)
    } else {
        Err(PreviewError::render(format!(
            "device pixel ratio must be finite and > 0, got {dpr}"
        )))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
