//! Point rendering.

use log::debug;

use crate::geom::Vertex;
use crate::render::blend::Blender;
use crate::render::shader::texel;
use crate::render::target::{LockMode, Target, Texture};

use super::{all_finite, floor};

/// Draws the vertex `v` as a single pixel, blending it with the target
/// using `blender`.
///
/// The pixel drawn is the one containing the position of `v`. If `texture`
/// is given, the texel at the texture coordinates of `v` is used, tinted with
/// the color of `v` unless the color is white.
///
/// Returns whether the pixel was written. Nothing is drawn if the pixel is
/// outside the draw area, or if the target is locked read-only.
pub fn draw_soft_point<T>(
    target: &mut T,
    v: &Vertex,
    texture: Option<&Texture>,
    blender: &Blender,
) -> bool
where
    T: Target + ?Sized,
{
    if !all_finite(&[v.pos]) {
        return false;
    }
    if let Some((_, LockMode::ReadOnly)) = target.locked_region() {
        debug!("skipping point: target locked read-only");
        return false;
    }
    let (x, y) = (floor(v.pos.x()), floor(v.pos.y()));

    let color = match texture {
        Some(tex) => {
            let c = texel(tex, v.uv.x(), v.uv.y());
            if v.color.is_white() { c } else { c.mul_color(v.color) }
        }
        None => v.color,
    };
    if blender.is_identity() {
        target.put_pixel(x, y, color)
    } else {
        target.draw_pixel(x, y, color, blender)
    }
}

#[cfg(test)]
mod tests {
    use crate::geom::vertex;
    use crate::math::color::{Color4f, rgb, rgba};
    use crate::math::vec::vec2;
    use crate::render::target::Bitmap;
    use crate::util::buf::{AsSlice2, Buf2};
    use crate::util::rect::Rect;

    use super::*;

    const RED: Color4f = rgb(1.0, 0.0, 0.0);

    #[test]
    fn draws_containing_pixel() {
        let mut bmp = Bitmap::new(4, 4);
        let v = vertex(vec2(2.9, 1.0), RED);
        assert!(draw_soft_point(&mut bmp, &v, None, &Blender::IDENTITY));
        assert_eq!(bmp.get_pixel(2, 1), Some(RED));
        assert_eq!(bmp.buf().iter().filter(|&&c| c == RED).count(), 1);
    }

    #[test]
    fn outside_draws_nothing() {
        let mut bmp = Bitmap::new(4, 4);
        let id = Blender::IDENTITY;
        for (x, y) in [(-0.5, 0.0), (4.0, 1.0), (1.0, 7.5), (f32::NAN, 1.0)] {
            let v = vertex(vec2(x, y), RED);
            assert!(!draw_soft_point(&mut bmp, &v, None, &id));
        }
        bmp.set_clip(Rect::new(0, 0, 2, 2));
        let v = vertex(vec2(2.5, 0.5), RED);
        assert!(!draw_soft_point(&mut bmp, &v, None, &id));
        assert!(bmp.buf().iter().all(|&c| c == Color4f::TRANSPARENT));
    }

    #[test]
    fn respects_lock() {
        let mut bmp = Bitmap::new(4, 4);
        let v = vertex(vec2(0.5, 0.5), RED);
        let id = Blender::IDENTITY;

        bmp.lock_region(&Rect::new(0, 0, 4, 4), LockMode::ReadOnly)
            .unwrap();
        assert!(!draw_soft_point(&mut bmp, &v, None, &id));

        bmp.unlock();
        bmp.lock_region(&Rect::new(2, 2, 2, 2), LockMode::WriteOnly)
            .unwrap();
        assert!(!draw_soft_point(&mut bmp, &v, None, &id));
        let v = vertex(vec2(3.5, 3.5), RED);
        assert!(draw_soft_point(&mut bmp, &v, None, &id));
    }

    #[test]
    fn textured_point() {
        let tex = Buf2::new(2, 1, [rgb(0.0, 1.0, 1.0), rgb(1.0, 1.0, 0.0)]);
        let tex = tex.as_slice2();
        let mut bmp = Bitmap::new(2, 1);
        let id = Blender::IDENTITY;

        let v = vertex(vec2(0.5, 0.5), Color4f::WHITE).with_uv(vec2(3.5, 0.0));
        draw_soft_point(&mut bmp, &v, Some(&tex), &id);
        assert_eq!(bmp.get_pixel(0, 0), Some(rgb(1.0, 1.0, 0.0)));

        let v = vertex(vec2(1.5, 0.5), RED).with_uv(vec2(0.5, 0.0));
        draw_soft_point(&mut bmp, &v, Some(&tex), &id);
        assert_eq!(bmp.get_pixel(1, 0), Some(rgb(0.0, 0.0, 0.0)));
    }

    #[test]
    fn blended_point() {
        let mut bmp = Bitmap::try_new(1, 1, rgb(0.0, 0.0, 1.0)).unwrap();
        let v = vertex(vec2(0.0, 0.0), rgba(0.5, 0.0, 0.0, 0.5));
        draw_soft_point(&mut bmp, &v, None, &Blender::PREMULTIPLIED);
        assert_eq!(bmp.get_pixel(0, 0), Some(rgb(0.5, 0.0, 0.5)));
    }
}
