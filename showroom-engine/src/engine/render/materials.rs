use std::collections::HashMap;

use bevy::prelude::*;
use constants::render_settings::{INERT_COLOR, MASK_COLOR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(u32);

impl MaterialId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub base_color: Vec3,
    pub emissive: Vec3,
}

impl Material {
    pub fn opaque(base_color: Vec3) -> Self {
        Self {
            base_color,
            emissive: Vec3::ZERO,
        }
    }

    pub fn emissive(base_color: Vec3, emissive: Vec3) -> Self {
        Self {
            base_color,
            emissive,
        }
    }

    /// Lit material drawn by the base camera.
    pub fn lit(&self) -> StandardMaterial {
        StandardMaterial {
            base_color: Color::linear_rgb(self.base_color.x, self.base_color.y, self.base_color.z),
            emissive: LinearRgba::rgb(self.emissive.x, self.emissive.y, self.emissive.z),
            perceptual_roughness: 0.6,
            ..default()
        }
    }

    /// Unlit colour drawn by the glow and mask cameras.
    pub fn flat(&self) -> StandardMaterial {
        let color = self.base_color + self.emissive;
        StandardMaterial {
            base_color: Color::linear_rgb(color.x, color.y, color.z),
            unlit: true,
            ..default()
        }
    }
}

/// Owns every material in the showroom. Slot 0 is the inert black material
/// the glow pass substitutes for untagged nodes, slot 1 the flat white one
/// selected nodes show in the outline mask.
#[derive(Resource, Debug)]
pub struct MaterialLibrary {
    materials: Vec<Material>,
    by_name: HashMap<String, MaterialId>,
}

impl Default for MaterialLibrary {
    fn default() -> Self {
        Self {
            materials: vec![Material::opaque(INERT_COLOR), Material::opaque(MASK_COLOR)],
            by_name: HashMap::new(),
        }
    }
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inert(&self) -> MaterialId {
        MaterialId(0)
    }

    pub fn mask(&self) -> MaterialId {
        MaterialId(1)
    }

    pub fn add(&mut self, name: impl Into<String>, material: Material) -> MaterialId {
        let id = MaterialId(self.materials.len() as u32);
        self.materials.push(material);
        self.by_name.entry(name.into()).or_insert(id);
        id
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.index())
    }

    pub fn lookup(&self, name: &str) -> Option<MaterialId> {
        self.by_name.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.materials
            .iter()
            .enumerate()
            .map(|(index, material)| (MaterialId(index as u32), material))
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }
}

/// `StandardMaterial` assets for every library slot, lit and flat.
#[derive(Resource, Debug, Default)]
pub struct MaterialHandles {
    lit: Vec<Handle<StandardMaterial>>,
    flat: Vec<Handle<StandardMaterial>>,
}

impl MaterialHandles {
    pub fn build(library: &MaterialLibrary, assets: &mut Assets<StandardMaterial>) -> Self {
        let (lit, flat) = library
            .iter()
            .map(|(_, material)| (assets.add(material.lit()), assets.add(material.flat())))
            .unzip();
        Self { lit, flat }
    }

    pub fn lit(&self, id: MaterialId) -> Option<&Handle<StandardMaterial>> {
        self.lit.get(id.index())
    }

    pub fn flat(&self, id: MaterialId) -> Option<&Handle<StandardMaterial>> {
        self.flat.get(id.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_slots_precede_named_materials() {
        let mut library = MaterialLibrary::new();
        let neon = library.add("neon", Material::emissive(Vec3::ONE, Vec3::new(1.0, 0.2, 0.8)));

        assert_ne!(neon, library.inert());
        assert_ne!(neon, library.mask());
        assert_eq!(library.get(library.inert()).unwrap().base_color, Vec3::ZERO);
        assert_eq!(library.get(library.inert()).unwrap().emissive, Vec3::ZERO);
        assert_eq!(library.get(library.mask()).unwrap().base_color, Vec3::ONE);
        assert_eq!(library.lookup("neon"), Some(neon));
        assert_eq!(library.len(), 3);
    }

    #[test]
    fn flat_variant_is_unlit_and_carries_emission() {
        let neon = Material::emissive(Vec3::new(0.5, 0.0, 0.0), Vec3::new(0.5, 0.2, 0.0));

        let flat = neon.flat();
        assert!(flat.unlit);
        assert_eq!(flat.base_color, Color::linear_rgb(1.0, 0.2, 0.0));

        let lit = neon.lit();
        assert!(!lit.unlit);
        assert_eq!(lit.emissive, LinearRgba::rgb(0.5, 0.2, 0.0));
    }

    #[test]
    fn handles_cover_every_slot() {
        let mut library = MaterialLibrary::new();
        let wall = library.add("wall", Material::opaque(Vec3::splat(0.3)));
        let mut assets = Assets::<StandardMaterial>::default();

        let handles = MaterialHandles::build(&library, &mut assets);

        assert!(handles.lit(wall).is_some());
        assert!(handles.flat(library.inert()).is_some());
        assert_ne!(handles.lit(wall), handles.flat(wall));
        assert!(assets.get(handles.flat(library.mask()).unwrap()).unwrap().unlit);
    }
}
