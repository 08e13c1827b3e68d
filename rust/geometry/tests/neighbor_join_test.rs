// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use ramp_lite_geometry::{
    Cutout, CylinderRampParams, Mesh, Placement, PlatformParams, Point3, ShapeDescriptor,
};

/// Neighbour cutouts re-expressed in the receiver's frame
fn cutouts_for(
    receiver: &Placement,
    neighbours: &[(&ShapeDescriptor, &Placement)],
) -> Vec<Cutout> {
    let to_local = receiver.world_to_local().unwrap();
    neighbours
        .iter()
        .flat_map(|(shape, placement)| {
            let to_world = placement.local_to_world();
            shape
                .cutouts()
                .into_iter()
                .map(move |c| c.transformed(&to_world, &to_local))
        })
        .collect()
}

fn world_vertices(mesh: &Mesh, placement: &Placement) -> Vec<Point3<f64>> {
    let m = placement.local_to_world();
    (0..mesh.vertex_count())
        .map(|i| m.transform_point(&mesh.position(i).cast::<f64>()))
        .collect()
}

#[test]
fn test_adjacent_platforms_share_seam() {
    let shape = ShapeDescriptor::new(PlatformParams::new(4.0, 0.25, 4.0));
    let r = shape.lip.radius;
    let a = Placement::default();
    let b = Placement::at(4.0, 0.0, 0.0);

    let (mesh_a, _) = shape.generate(&cutouts_for(&a, &[(&shape, &b)]));
    let (mesh_b, _) = shape.generate(&cutouts_for(&b, &[(&shape, &a)]));
    let va = world_vertices(&mesh_a, &a);
    let vb = world_vertices(&mesh_b, &b);

    // No rail runs along the shared edge
    for p in &va {
        assert!(
            !(p.x > 2.0 - r * 0.5 && p.z.abs() < 2.0 - 2.0 * r),
            "rail vertex of A inside the seam at {p:?}"
        );
    }
    for p in &vb {
        assert!(
            !(p.x < 2.0 + r * 0.5 && p.z.abs() < 2.0 - 2.0 * r),
            "rail vertex of B inside the seam at {p:?}"
        );
    }

    // Rail ends meet exactly on the seam line
    let on_seam = |v: &[Point3<f64>]| -> Vec<Point3<f64>> {
        v.iter().copied().filter(|p| (p.x - 2.0).abs() < 1e-5).collect()
    };
    let (seam_a, seam_b) = (on_seam(&va), on_seam(&vb));
    assert!(!seam_a.is_empty());
    assert_eq!(seam_a.len(), seam_b.len());
    for p in &seam_a {
        assert!(
            seam_b.iter().any(|q| (p - q).norm() < 1e-5),
            "no matching rail vertex for {p:?}"
        );
    }
}

#[test]
fn test_isolated_platform_has_full_rails() {
    let shape = ShapeDescriptor::new(PlatformParams::new(4.0, 0.25, 4.0));
    let d = shape.lip.divisions();
    let far = Placement::at(50.0, 0.0, 0.0);
    let here = Placement::default();

    // Cutouts from a distant piece touch nothing
    let (mesh, _) = shape.generate(&cutouts_for(&here, &[(&shape, &far)]));
    assert_eq!(mesh.vertex_count(), 6 * 4 + 2 * 4 * (d + 1));
}

#[test]
fn test_ramp_entry_lip_yields_to_platform() {
    // Ramp entry line sits on the platform's +z top edge
    let platform = ShapeDescriptor::new(PlatformParams::new(4.0, 0.25, 4.0));
    let ramp = ShapeDescriptor::new(CylinderRampParams::default());
    let platform_at = Placement::default();
    let ramp_at = Placement::at(0.0, 0.0, 2.0);

    let (platform_mesh, _) =
        platform.generate(&cutouts_for(&platform_at, &[(&ramp, &ramp_at)]));
    let (plain, _) = platform.generate(&[]);
    // The stretch under the ramp entry is dropped, leaving two capped stubs
    assert!(platform_mesh.vertex_count() > plain.vertex_count());

    let covered = world_vertices(&platform_mesh, &platform_at)
        .into_iter()
        .filter(|p| p.z > 1.95 && p.y > -0.05 && p.x.abs() < 0.9)
        .count();
    assert_eq!(covered, 0);

    let (ramp_mesh, _) = ramp.generate(&cutouts_for(&ramp_at, &[(&platform, &platform_at)]));
    assert!(!ramp_mesh.is_empty());
}
