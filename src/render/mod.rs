pub mod instance;

use crate::cat::sprite::SpriteSheet;
use crate::ecs::components::{Appearance, Ball, CatId, Position, PrevPosition, Sprite, Thought};

pub use instance::{BallInstance, CatInstance, ThoughtCue};

/// Everything a host needs to draw one frame.
#[derive(Debug, Clone, Default)]
pub struct RenderFrame {
    /// Sorted by cat id.
    pub cats: Vec<CatInstance>,
    pub balls: Vec<BallInstance>,
    pub thoughts: Vec<ThoughtCue>,
}

impl RenderFrame {
    /// Rebuild the frame in place, reusing allocations.
    /// `alpha` is the fraction of the next tick already elapsed (0..=1).
    pub fn build(&mut self, world: &hecs::World, sheet: &SpriteSheet, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        self.cats.clear();
        self.balls.clear();
        self.thoughts.clear();

        let mut cats: Vec<(CatId, CatInstance, Option<ThoughtCue>)> = world
            .query::<(&CatId, &Position, &PrevPosition, &Appearance, &Sprite, Option<&Thought>)>()
            .iter()
            .map(|(_, (id, pos, prev, look, sprite, thought))| {
                let inst = CatInstance::from_components(pos, prev, look, sprite, sheet, alpha);
                let cue = thought
                    .and_then(|t| t.0.as_ref())
                    .map(|cue| ThoughtCue::new(id.0, glam::Vec2::from(inst.position), cue));
                (*id, inst, cue)
            })
            .collect();
        cats.sort_unstable_by_key(|(id, _, _)| *id);
        for (_, inst, cue) in cats {
            self.cats.push(inst);
            self.thoughts.extend(cue);
        }

        let mut balls: Vec<(u64, BallInstance)> = world
            .query::<(&Ball, &Position, &PrevPosition)>()
            .iter()
            .map(|(_, (ball, pos, prev))| (ball.serial, BallInstance::from_components(pos, prev, ball, alpha)))
            .collect();
        balls.sort_unstable_by_key(|(serial, _)| *serial);
        self.balls.extend(balls.into_iter().map(|(_, inst)| inst));
    }
}
