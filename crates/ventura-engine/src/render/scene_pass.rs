//! Frame-level drawing of a whole `DrawList` with both pipelines.

use std::ops::Range;

use crate::render::{ColorRenderer, RenderCtx, RenderTarget, SpriteRenderer};
use crate::scene::{DrawCmd, DrawList};

/// A maximal stretch of consecutive paint-order items that one pipeline draws.
///
/// Ranges index the renderers' upload buffers: instances for sprites, vertices for meshes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaintRun {
    Sprites(Range<u32>),
    Meshes(Range<u32>),
}

/// Splits `draw_list` into pipeline runs in paint order.
///
/// Skipped (non-drawable) items neither consume buffer slots nor break a run, matching what
/// `SpriteRenderer::prepare` and `ColorRenderer::prepare` upload.
pub fn paint_runs(draw_list: &mut DrawList, out: &mut Vec<PaintRun>) {
    out.clear();
    let mut next_instance = 0u32;
    let mut next_vertex = 0u32;

    for item in draw_list.iter_in_paint_order() {
        match &item.cmd {
            DrawCmd::Sprite(cmd) if cmd.is_drawable() => {
                let slot = next_instance;
                next_instance += 1;
                match out.last_mut() {
                    Some(PaintRun::Sprites(run)) => run.end = next_instance,
                    _ => out.push(PaintRun::Sprites(slot..next_instance)),
                }
            }
            DrawCmd::Mesh(mesh) if mesh.is_drawable() => {
                let first = next_vertex;
                next_vertex += mesh.vertices.len() as u32;
                match out.last_mut() {
                    Some(PaintRun::Meshes(run)) => run.end = next_vertex,
                    _ => out.push(PaintRun::Meshes(first..next_vertex)),
                }
            }
            _ => {}
        }
    }
}

/// Draws sprites and meshes interleaved by z in a single load pass.
///
/// Both renderers upload their whole share of the list once; the pass then switches
/// pipelines at every run boundary so a higher `ZIndex` covers a lower one regardless of
/// which pipeline draws it.
#[derive(Default)]
pub struct SceneRenderer {
    sprites: SpriteRenderer,
    meshes: ColorRenderer,
    runs: Vec<PaintRun>,
}

impl SceneRenderer {
    pub fn new(sprites: SpriteRenderer) -> Self {
        Self {
            sprites,
            ..Self::default()
        }
    }

    pub fn sprites(&self) -> &SpriteRenderer {
        &self.sprites
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
    ) {
        let instances = self.sprites.prepare(ctx, draw_list);
        let vertices = self.meshes.prepare(ctx, draw_list);
        if instances == 0 && vertices == 0 {
            return;
        }

        paint_runs(draw_list, &mut self.runs);

        let mut rpass = target.begin_load_pass("ventura scene pass");
        for run in &self.runs {
            match run {
                PaintRun::Sprites(range) => self.sprites.draw(&mut rpass, range.clone()),
                PaintRun::Meshes(range) => self.meshes.draw(&mut rpass, range.clone()),
            }
        }
    }
}
