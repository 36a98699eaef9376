use std::sync::Arc;

use glam::{IVec2, Vec2};
use image::{Rgba, RgbaImage};
use speculoos::prelude::*;
use tilerunner::context::Physics;
use tilerunner::entity::movement::MoveBounds;
use tilerunner::entity::physics::integrate_axis;
use tilerunner::entity::variant::{EnemyKind, Variant};
use tilerunner::entity::Entity;
use tilerunner::region::{Mask, Rect, Region, Shape};

const WORLD_WIDTH: i32 = 200;

fn entity_at(x: i32, y: i32) -> Entity {
    Entity::new(
        0,
        Variant::Player(Default::default()),
        IVec2::new(x, y),
        Rect::new(0, 0, 10, 10),
        &Physics::default(),
    )
}

fn bounds(solid: &Region) -> MoveBounds<'_> {
    MoveBounds {
        solid,
        world_width: WORLD_WIDTH,
        iteration_cap: 1000,
    }
}

fn floor_at(y: i32) -> Region {
    let mut region = Region::new(16);
    region.add_rect(Rect::new(0, y, WORLD_WIDTH, 10));
    region
}

#[test]
fn test_never_ends_inside_solid() {
    let solid = floor_at(50);
    for (dx, dy) in [(0, 100), (7, 45), (-3, 41), (30, 39), (0, 40)] {
        let mut entity = entity_at(20, 0);
        entity.bounded_move(dx, dy, bounds(&solid));
        assert_that(&solid.intersects(&entity.bounds())).is_false();
    }
}

#[test]
fn test_lands_flush_and_grounds() {
    let solid = floor_at(50);
    let mut entity = entity_at(20, 0);
    entity.jump_count = 1;
    entity.velocity = Vec2::new(0.0, 120.0);

    let outcome = entity.bounded_move(0, 100, bounds(&solid));

    assert_that(&outcome.landed).is_true();
    assert_that(&outcome.moved).is_equal_to(IVec2::new(0, 40));
    assert_that(&entity.bounds().bottom()).is_equal_to(50);
    assert_that(&entity.jump_count).is_equal_to(0);
    assert_that(&entity.velocity.y).is_equal_to(0.0);
}

#[test]
fn test_unobstructed_move_is_complete() {
    let empty = Region::new(16);
    let mut entity = entity_at(50, 50);
    let outcome = entity.bounded_move(-17, 23, bounds(&empty));
    assert_that(&outcome.moved).is_equal_to(IVec2::new(-17, 23));
    assert_that(&entity.position).is_equal_to(IVec2::new(33, 73));
    assert_that(&outcome.blocked_x).is_false();
}

#[test]
fn test_axes_are_limited_independently() {
    let mut wall = Region::new(16);
    wall.add_rect(Rect::new(40, 0, 10, 200));
    let mut entity = entity_at(20, 0);

    let outcome = entity.bounded_move(30, 30, bounds(&wall));

    assert_that(&outcome.blocked_x).is_true();
    assert_that(&outcome.moved).is_equal_to(IVec2::new(10, 30));
}

#[test]
fn test_world_edges_bounce() {
    let empty = Region::new(16);

    let mut entity = entity_at(2, 0);
    let outcome = entity.bounded_move(-5, 0, bounds(&empty));
    assert_that(&outcome.moved.x).is_equal_to(-2);
    assert_that(&outcome.blocked_x).is_true();
    assert_that(&entity.facing_left).is_true();

    let mut entity = entity_at(WORLD_WIDTH - 10, 0);
    entity.bounded_move(5, 0, bounds(&empty));
    assert_that(&entity.position.x).is_equal_to(WORLD_WIDTH - 10);
}

#[test]
fn test_top_edge_is_open() {
    let empty = Region::new(16);
    let mut entity = entity_at(50, 3);
    let outcome = entity.bounded_move(0, -20, bounds(&empty));
    assert_that(&outcome.blocked_up).is_false();
    assert_that(&entity.position.y).is_equal_to(-17);
}

#[test]
fn test_ceiling_blocks_upward_move() {
    let mut ceiling = Region::new(16);
    ceiling.add_rect(Rect::new(0, 0, WORLD_WIDTH, 10));
    let mut entity = entity_at(50, 20);
    entity.velocity.y = -100.0;

    let outcome = entity.bounded_move(0, -20, bounds(&ceiling));

    assert_that(&outcome.blocked_up).is_true();
    assert_that(&entity.position.y).is_equal_to(10);
    assert_that(&entity.velocity.y).is_equal_to(-100.0);
}

#[test]
fn test_iteration_cap_terminates() {
    let empty = Region::new(16);
    let mut entity = entity_at(0, 0);
    let capped = MoveBounds {
        iteration_cap: 5,
        ..bounds(&empty)
    };
    let outcome = entity.bounded_move(50, 50, capped);
    assert_that(&outcome.capped).is_true();
    assert_that(&outcome.moved).is_equal_to(IVec2::new(5, 5));
}

#[test]
fn test_jump_respects_credit() {
    let solid = floor_at(10);
    let mut entity = entity_at(20, 0);
    assert_that(&entity.jump_limit).is_equal_to(1);

    assert_that(&entity.jump(300.0)).is_true();
    assert_that(&entity.velocity.y).is_equal_to(-300.0);

    entity.velocity.y = -120.0;
    assert_that(&entity.jump(300.0)).is_false();
    assert_that(&entity.velocity.y).is_equal_to(-120.0);

    entity.bounded_move(0, 5, bounds(&solid));
    assert_that(&entity.jump_count).is_equal_to(0);
    assert_that(&entity.jump(300.0)).is_true();
}

#[test]
fn test_friction_decays_monotonically_to_zero() {
    let physics = Physics::default();
    let dt = 1.0 / 60.0;
    let mut velocity = -100.0f32;
    let mut frames = 0;
    while velocity != 0.0 {
        let next = integrate_axis(velocity, 0.0, dt, physics.min_speed, physics.run_speed, physics.friction);
        assert_that(&next.abs()).is_less_than(velocity.abs());
        assert_that(&(next <= 0.0)).is_true();
        velocity = next;
        frames += 1;
        assert_that(&frames).is_less_than(1000);
    }
    assert_that(&velocity).is_equal_to(0.0);
}

#[test]
fn test_enemy_faces_left_on_spawn() {
    let physics = Physics::default();
    let slime = Entity::new(1, Variant::enemy(EnemyKind::Slime, &physics), IVec2::ZERO, Rect::new(0, 0, 8, 8), &physics);
    assert_that(&slime.facing_left).is_true();
    assert_that(&slime.emits_light()).is_false();
}

/// A floor of 16x16 ramp silhouettes (lower-left triangles) starting at `y`.
fn ramp_floor_at(y: i32) -> Region {
    let mut image = RgbaImage::new(16, 16);
    for (x, py, pixel) in image.enumerate_pixels_mut() {
        if py >= 15 - x {
            *pixel = Rgba([0, 0, 0, 255]);
        }
    }
    let mask = Arc::new(Mask::from_alpha(&image));

    let mut region = Region::new(16);
    for col in 0..WORLD_WIDTH / 16 {
        region.add(Shape::Mask {
            origin: IVec2::new(col * 16, y),
            mask: Arc::clone(&mask),
        });
    }
    region.add_rect(Rect::new(0, y + 16, WORLD_WIDTH, 10));
    region
}

#[test]
fn test_never_ends_inside_mask_silhouettes() {
    let solid = ramp_floor_at(60);
    let mut moves = 0;
    for x in (0..WORLD_WIDTH - 10).step_by(7) {
        for y in [0, 30, 45] {
            for (dx, dy) in [(0, 60), (13, 40), (-9, 55), (25, 25), (-40, 10), (4, 100)] {
                let mut entity = entity_at(x, y);
                if solid.intersects(&entity.bounds()) {
                    continue;
                }
                entity.bounded_move(dx, dy, bounds(&solid));
                assert_that(&solid.intersects(&entity.bounds())).is_false();
                moves += 1;
            }
        }
    }
    assert_that(&moves).is_greater_than(100);
}

#[test]
fn test_lands_on_ramp_slope() {
    let solid = ramp_floor_at(60);
    // Over the tall end of a ramp the floor is higher than over the short end.
    let mut tall = entity_at(6, 0);
    tall.bounded_move(0, 100, bounds(&solid));
    let mut short = entity_at(0, 0);
    short.bounded_move(0, 100, bounds(&solid));

    assert_that(&tall.bounds().bottom()).is_less_than(short.bounds().bottom());
    assert_that(&solid.intersects(&tall.bounds().translated(0, 1))).is_true();
}
