#![allow(unsafe_code)]

use glow::HasContext as _;

/// Outcome of the most recent uniform lookup, used to keep the warning about
/// a missing uniform to a single line instead of one per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    Pending,
    Found,
    Missing,
}

/// The `uniform vec2` that receives the surface resolution each frame.
#[derive(Debug)]
pub(crate) struct ResolutionUniform {
    name: String,
    value: (f32, f32),
    last_lookup: Lookup,
}

impl ResolutionUniform {
    pub(crate) fn new(name: impl Into<String>, value: (f32, f32)) -> Self {
        Self {
            name: name.into(),
            value,
            last_lookup: Lookup::Pending,
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// Looks the uniform up on the bound `program` and writes the resolution.
    ///
    /// A miss is not fatal: the draw still happens with whatever value the
    /// driver holds for the uniform. Returns whether the write landed.
    pub(crate) fn apply(&mut self, gl: &glow::Context, program: glow::Program) -> bool {
        let location = unsafe { gl.get_uniform_location(program, &self.name) };
        let found = location.is_some();
        self.note_lookup(found);
        if let Some(location) = location {
            unsafe { gl.uniform_2_f32(Some(&location), self.value.0, self.value.1) };
        }
        found
    }

    fn note_lookup(&mut self, found: bool) {
        let next = if found { Lookup::Found } else { Lookup::Missing };
        if next == Lookup::Missing && self.last_lookup != Lookup::Missing {
            tracing::warn!(
                uniform = %self.name,
                "resolution uniform not found in program; rendering continues without it"
            );
        } else if next == Lookup::Found && self.last_lookup == Lookup::Missing {
            tracing::info!(uniform = %self.name, "resolution uniform resolved");
        }
        self.last_lookup = next;
    }
}
