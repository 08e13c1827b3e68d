// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use ramp_lite_geometry::{
    CylinderRampParams, ForkRampParams, LipSettings, Mesh, PlatformParams, ScaleRampParams,
    ShapeDescriptor, ShapeKind, Vector3,
};

fn catalogue() -> Vec<ShapeDescriptor> {
    let kinds: Vec<ShapeKind> = vec![
        PlatformParams::default().into(),
        PlatformParams::new(3.0, 0.0, 1.5).into(),
        CylinderRampParams::default().into(),
        CylinderRampParams {
            angle: -90.0,
            ..Default::default()
        }
        .into(),
        CylinderRampParams {
            angle: 45.0,
            radius: 2.0,
            detail: 4,
            ..Default::default()
        }
        .into(),
        ScaleRampParams::default().into(),
        ScaleRampParams {
            size: Vector3::new(1.0, 0.5, 3.0),
            scale_factor: 1.5,
        }
        .into(),
        ForkRampParams::default().into(),
        ForkRampParams {
            spread_angle: 40.0,
            ..Default::default()
        }
        .into(),
    ];
    kinds.into_iter().map(ShapeDescriptor::new).collect()
}

fn inward_triangles(mesh: &Mesh) -> usize {
    mesh.triangles()
        .filter(|&[a, b, c]| {
            let (pa, pb, pc) = (
                mesh.position(a as usize),
                mesh.position(b as usize),
                mesh.position(c as usize),
            );
            let face = (pb - pa).cross(&(pc - pa));
            if face.norm() < 1e-7 {
                return false;
            }
            let average =
                mesh.normal(a as usize) + mesh.normal(b as usize) + mesh.normal(c as usize);
            face.dot(&average) <= 0.0
        })
        .count()
}

#[test]
fn test_every_shape_winds_outward() {
    for descriptor in catalogue() {
        let (render, _) = descriptor.generate(&[]);
        assert!(!render.is_empty(), "{} produced nothing", descriptor.kind.name());
        assert_eq!(
            inward_triangles(&render),
            0,
            "{} has inward-facing triangles",
            descriptor.kind.name()
        );
    }
}

#[test]
fn test_indices_in_range() {
    for descriptor in catalogue() {
        let (render, collision) = descriptor.generate(&[]);
        let n = render.vertex_count() as u32;
        assert!(render.indices.iter().all(|&i| i < n));
        assert_eq!(render.normals.len(), render.positions.len());
        assert_eq!(render.uvs.len() / 2, render.vertex_count());
        let n = collision.vertex_count() as u32;
        assert!(collision.indices.iter().all(|&i| i < n));
        assert_eq!(collision.indices.len() % 3, 0);
    }
}

#[test]
fn test_generation_is_deterministic() {
    for descriptor in catalogue() {
        let cutouts = descriptor.cutouts();
        assert_eq!(descriptor.generate(&cutouts), descriptor.generate(&cutouts));
    }
}

#[test]
fn test_finer_lips_add_vertices() {
    let coarse = ShapeDescriptor::new(PlatformParams::default());
    let fine = coarse.clone().with_lip(LipSettings {
        detail: 64,
        ..LipSettings::default()
    });
    assert!(fine.lip.divisions() > coarse.lip.divisions());
    assert!(fine.generate(&[]).0.vertex_count() > coarse.generate(&[]).0.vertex_count());
}

#[test]
fn test_default_parameters_validate() {
    for descriptor in catalogue() {
        assert!(descriptor.validate().is_ok(), "{}", descriptor.kind.name());
    }
}
