use glam::UVec2;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;
use tilerunner::entity::variant::EnemyKind;
use tilerunner::error::ParseError;
use tilerunner::map::biome::Biome;
use tilerunner::map::catalog::{GeometryClass, SpawnKind, TileCatalog};
use tilerunner::map::parser::LevelParser;

#[test]
fn test_parse_spawns_and_solid_row() {
    let parsed = LevelParser::parse("g\nP..S\n####").unwrap();

    assert_that(&parsed.biome).is_equal_to(Biome::Grass);
    assert_that(&parsed.grid.size()).is_equal_to(UVec2::new(4, 2));

    let spawns: Vec<_> = parsed.spawns.iter().map(|s| (s.kind, s.cell)).collect();
    assert_eq!(
        spawns,
        vec![
            (SpawnKind::Player, UVec2::new(0, 0)),
            (SpawnKind::Enemy(EnemyKind::Slime), UVec2::new(3, 0)),
        ]
    );

    for col in 0..4 {
        assert_that(&parsed.grid.get(col, 1).is_solid()).is_true();
        assert_that(&parsed.grid.get(col, 0).is_solid()).is_false();
    }
}

#[test]
fn test_unknown_characters_are_air() {
    let parsed = LevelParser::parse("s\n@%#").unwrap();
    assert_that(&parsed.grid.get(0, 0).class).is_equal_to(GeometryClass::Air);
    assert_that(&parsed.grid.get(1, 0).class).is_equal_to(GeometryClass::Air);
    assert_that(&parsed.grid.get(2, 0).class).is_equal_to(GeometryClass::SolidSquare);
}

#[test]
fn test_ragged_lines_pad_with_air() {
    let parsed = LevelParser::parse("c\n#\n\n###").unwrap();
    assert_that(&parsed.grid.size()).is_equal_to(UVec2::new(3, 3));
    assert_that(&parsed.grid.get(1, 0).class).is_equal_to(GeometryClass::Air);
    assert_that(&parsed.grid.get(0, 1).class).is_equal_to(GeometryClass::Air);
    assert_that(&parsed.grid.get(2, 2).class).is_equal_to(GeometryClass::SolidSquare);
}

#[test]
fn test_parse_errors() {
    assert_that(&LevelParser::parse("")).is_err_containing(ParseError::Empty);
    assert_that(&LevelParser::parse("q\n###")).is_err_containing(ParseError::UnknownBiome('q'));
    assert_that(&LevelParser::parse("gd\n###")).is_err_containing(ParseError::MalformedBiome("gd".to_string()));
    assert_that(&LevelParser::parse("g\n\n\n")).is_err_containing(ParseError::NoRows);
}

#[test]
fn test_catalog_size() {
    let entries = TileCatalog::entries().count();
    assert_that(&entries).is_greater_than_or_equal_to(38);
    assert_that(&entries).is_less_than_or_equal_to(45);
}
