use std::f32::consts::FRAC_PI_2;

use tessera_types::*;

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

fn close_vec(a: Vector3, b: Vector3) -> bool {
    close(a.x, b.x) && close(a.y, b.y) && close(a.z, b.z)
}

#[test]
fn vector_arithmetic() {
    let a = Vector3::new(1.0, 2.0, 3.0);
    let b = Vector3::new(4.0, 5.0, 6.0);

    assert_eq!(a + b, Vector3::new(5.0, 7.0, 9.0));
    assert_eq!(b - a, Vector3::new(3.0, 3.0, 3.0));
    assert_eq!(a * 2.0, 2.0 * a);
    assert_eq!(a * b, Vector3::new(4.0, 10.0, 18.0));
    assert_eq!(a.dot(b), 32.0);
    assert_eq!(Vector3::X_AXIS.cross(Vector3::Y_AXIS), Vector3::Z_AXIS);
    assert_eq!(Vector3::new(3.0, 4.0, 0.0).length(), 5.0);
    assert_eq!(Vector2::new(0.0, 0.0).distance(Vector2::new(3.0, 4.0)), 5.0);
    assert_eq!(Vector3::ZERO.normalize(), Vector3::ZERO);
    assert!(close(Vector4::new(1.0, 1.0, 1.0, 1.0).normalize().length(), 1.0));
    assert!(!Vector3::new(f32::NAN, 0.0, 0.0).is_finite());
}

#[test]
fn vector_text() -> Result<(), ParseVectorError> {
    let v = Vector3::new(1.5, -2.0, 3.0);
    assert_eq!(v.to_string(), "<1.5, -2, 3>");
    assert_eq!(Vector3::parse("<1.5, -2, 3>")?, v);
    assert_eq!(" < 1.5 ,-2,3 > ".parse::<Vector3>()?, v);
    assert_eq!(Vector3d::parse("<1, 2, 3>")?, Vector3d::new(1.0, 2.0, 3.0));

    assert_eq!(
        Vector2::parse("<1, 2, 3>"),
        Err(ParseVectorError::Components {
            expected: 2,
            found: 3,
        })
    );
    assert!(Vector3::parse("<a, b, c>").is_err());

    Ok(())
}

#[test]
fn double_precision_conversion() {
    let v = Vector3d::new(1.0, 2.5, -3.0);
    assert_eq!(Vector3::from(v), Vector3::new(1.0, 2.5, -3.0));
    assert_eq!(Vector3d::from(Vector3::from(v)), v);
}

#[test]
fn quaternion_rotation() {
    let q = Quaternion::from_axis_angle(Vector3::Z_AXIS, FRAC_PI_2);
    assert!(close(q.magnitude(), 1.0));

    let rotated = Vector3::X_AXIS * q;
    assert!(close_vec(rotated, Vector3::Y_AXIS));

    let by_matrix = Vector3::X_AXIS * q.to_matrix();
    assert!(close_vec(by_matrix, Vector3::Y_AXIS));

    let half = q * q;
    assert!(close_vec(Vector3::X_AXIS * half, Vector3::new(-1.0, 0.0, 0.0)));
    assert_eq!(q * Quaternion::IDENTITY, q);
    assert!(close_vec(Vector3::X_AXIS * q * q.conjugate(), Vector3::X_AXIS));
}

#[test]
fn rotation_between_vectors() {
    let q = Vector3::X_AXIS.rotation_between(Vector3::Y_AXIS);
    assert!(close_vec(Vector3::X_AXIS * q, Vector3::Y_AXIS));
    assert_eq!(Vector3::X_AXIS.rotation_between(Vector3::X_AXIS), Quaternion::IDENTITY);
}

#[test]
fn quaternion_normalization() {
    let q = Quaternion::new(0.0, 0.0, 0.0, 2.0).normalize();
    assert_eq!(q, Quaternion::IDENTITY);
    assert_eq!(Quaternion::new(0.0, 0.0, 0.0, 0.0).normalize(), Quaternion::IDENTITY);
    assert_eq!(Quaternion::default(), Quaternion::IDENTITY);
    assert_eq!(Quaternion::from_xyz(0.0, 0.0, 0.0), Quaternion::IDENTITY);
}

#[test]
fn matrix_operations() {
    let m = Matrix3::from_rows([1.0, 2.0, 3.0], [0.0, 1.0, 4.0], [5.0, 6.0, 0.0]);

    assert_eq!(m.trace(), 2.0);
    assert_eq!(m.determinant(), 1.0);
    assert_eq!(m.transpose().transpose(), m);
    assert_eq!(m.transpose().get(0, 2), Some(5.0));
    assert_eq!(m.get(3, 0), None);
    assert_eq!(m * Matrix3::IDENTITY, m);
    assert_eq!(m + Matrix3::ZERO, m);
    assert_eq!(m - m, Matrix3::ZERO);
    assert_eq!((Matrix3::ZERO + 1.0).trace(), 3.0);
    assert_eq!(m.row(1), Some(Vector3::new(0.0, 1.0, 4.0)));
    assert_eq!(m.row(3), None);
    assert_eq!(m[2], [5.0, 6.0, 0.0]);

    let mut n = m;
    assert_eq!(n.set_row(0, Vector3::ZERO), Some(Vector3::new(1.0, 2.0, 3.0)));
    assert_eq!(n.i, [0.0; 3]);
    assert_eq!(n.set_row(5, Vector3::ZERO), None);
}

#[test]
fn matrix_orthogonalize_and_euler() {
    let mut m = Matrix3::from_rows([2.0, 0.0, 0.0], [1.0, 3.0, 0.0], [0.0, 0.0, 9.0]);
    m.orthogonalize();
    assert_eq!(m, Matrix3::IDENTITY);

    let yaw = Quaternion::from_axis_angle(Vector3::Z_AXIS, 0.5).to_matrix();
    let angles = yaw.euler_angles();
    assert!(close(angles.roll, 0.0));
    assert!(close(angles.pitch, 0.0));
    assert!(close(angles.yaw.abs(), 0.5));

    assert_eq!(Matrix3::IDENTITY.euler_angles(), Euler::default());
}

#[test]
fn color_channels() {
    let c = Color::new(1.5, -0.5, 0.5, 1.0);
    assert_eq!(c, Color { r: 1.0, g: 0.0, b: 0.5, a: 1.0 });

    let bytes = [0, 128, 200, 255];
    assert_eq!(Color::from_rgba8(bytes, false).to_rgba8(), bytes);
    assert_eq!(Color::from_rgba8(bytes, true).to_rgba8(), [255, 127, 55, 0]);
    assert_eq!(Color::from_rgba8(bytes, false).to_inverted_rgba8(), [255, 127, 55, 0]);
    assert_eq!(Color::BLACK.to_rgba8(), [0, 0, 0, 255]);
}
