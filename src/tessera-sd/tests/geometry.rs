use tessera_sd::{
    decode, encode,
    types::{Color, Matrix3, Quaternion, Uuid, Vector2, Vector3, Vector3d, Vector4},
    Array, DecodeError, FromStructured, Map, ToStructured, Value,
};

fn reals(components: &[f64]) -> Value {
    Value::Array(components.iter().copied().map(Value::from_real).collect::<Array>())
}

#[test]
fn vectors_project_in_component_order() {
    assert_eq!(Vector2::new(1.0, 2.0).to_structured(), reals(&[1.0, 2.0]));
    assert_eq!(
        Vector3::new(1.0, 2.0, 3.0).to_structured(),
        reals(&[1.0, 2.0, 3.0])
    );
    assert_eq!(
        Vector3d::new(1.0, 2.0, 3.0).to_structured(),
        reals(&[1.0, 2.0, 3.0])
    );
    assert_eq!(
        Vector4::new(1.0, 2.0, 3.0, 4.0).to_structured(),
        reals(&[1.0, 2.0, 3.0, 4.0])
    );
}

#[test]
fn rotations_and_colors_project_in_component_order() {
    assert_eq!(
        Quaternion::new(0.5, -0.5, 0.5, -0.5).to_structured(),
        reals(&[0.5, -0.5, 0.5, -0.5])
    );
    assert_eq!(
        Color::new(0.25, 0.5, 0.75, 1.0).to_structured(),
        reals(&[0.25, 0.5, 0.75, 1.0])
    );

    let m = Matrix3::from_rows([1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]);
    assert_eq!(
        m.to_structured(),
        reals(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0])
    );
    assert_eq!(Matrix3::from_structured(&m.to_structured()), m);
}

#[test]
fn projections_read_back() {
    let v = Vector3::new(-1.5, 0.25, 1024.0);
    assert_eq!(Vector3::from_structured(&v.to_structured()), v);

    let v = Vector3d::new(1e300, -2.5, 0.1);
    assert_eq!(Vector3d::from_structured(&v.to_structured()), v);

    let v = Vector4::new(1.0, 2.0, 3.0, 4.0);
    assert_eq!(Vector4::from_structured(&v.to_structured()), v);

    let q = Quaternion::new(0.0, 0.0, 0.6, 0.8);
    assert_eq!(Quaternion::from_structured(&q.to_structured()), q);

    let c = Color::new(0.1, 0.2, 0.3, 0.4);
    assert_eq!(Color::from_structured(&c.to_structured()), c);
}

#[test]
fn components_coerce() {
    let mut array = Array::new();
    array.push(1);
    array.push(Value::from_string("2.5"));
    array.push(true);

    assert_eq!(
        Vector3::from_structured(&Value::Array(array)),
        Vector3::new(1.0, 2.5, 1.0)
    );
}

#[test]
fn wrong_shapes_fall_back() {
    let short = reals(&[1.0, 2.0]);
    let map = Value::Map(Map::new());

    assert_eq!(Vector2::from_structured(&map), Vector2::ZERO);
    assert_eq!(Vector3::from_structured(&short), Vector3::ZERO);
    assert_eq!(Vector3d::from_structured(&Value::Unknown), Vector3d::ZERO);
    assert_eq!(Vector4::from_structured(&short), Vector4::ZERO);
    assert_eq!(Quaternion::from_structured(&short), Quaternion::IDENTITY);
    assert_eq!(Color::from_structured(&short), Color::BLACK);
    assert_eq!(Matrix3::from_structured(&short), Matrix3::ZERO);
    assert_eq!(
        Vector2::from_structured(&Value::from_string("<1, 2>")),
        Vector2::ZERO
    );
}

#[test]
fn colors_clamp_when_read() {
    assert_eq!(
        Color::from_structured(&reals(&[2.0, -1.0, 0.5, 1.0])),
        Color::new(1.0, 0.0, 0.5, 1.0)
    );
}

#[test]
fn uuids_project_as_scalars() {
    let id = Uuid::random();

    assert_eq!(id.to_structured(), Value::from_uuid(id));
    assert_eq!(Uuid::from_structured(&id.to_structured()), id);
    assert_eq!(
        Uuid::from_structured(&Value::from_string(id.to_string())),
        id
    );
    assert_eq!(Uuid::from_structured(&Value::from_integer(1)), Uuid::ZERO);
}

#[test]
fn projections_survive_the_codec() -> Result<(), DecodeError> {
    let mut map = Map::new();
    map.insert("position", Vector3::new(128.0, 64.5, 22.25).to_structured());
    map.insert("rotation", Quaternion::IDENTITY.to_structured());
    map.insert("color", Color::BLACK.to_structured());
    let value = Value::Map(map);

    let decoded = decode(&encode(&value))?;
    assert_eq!(
        Vector3::from_structured(&decoded["position"]),
        Vector3::new(128.0, 64.5, 22.25)
    );
    assert_eq!(
        Quaternion::from_structured(&decoded["rotation"]),
        Quaternion::IDENTITY
    );
    assert_eq!(Color::from_structured(&decoded["color"]), Color::BLACK);
    assert_eq!(
        Vector3::from_structured(&decoded["velocity"]),
        Vector3::ZERO
    );

    Ok(())
}
