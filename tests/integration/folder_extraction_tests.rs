/*!
 * Integration tests for extracting a directory of scripts
 */

use std::fs;
use anyhow::Result;

use rpytl::app_config::Config;
use rpytl::app_controller::Controller;
use rpytl::placeholder::TokenMapping;
use crate::common;

/// Each script in a folder gets its own mapping, numbered from @@1@@
#[test]
fn test_extract_folder_withTwoScripts_shouldNotShareMappings() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let game = temp_dir.path().join("game");
    fs::create_dir(&game)?;
    common::create_test_file(&game, "a.rpy", "e \"{b}Bold{/b}\"\n")?;
    common::create_test_file(&game, "b.rpy", "e \"[name]\"\n")?;
    common::create_test_file(&game, "readme.txt", "e \"ignored\"\n")?;
    let out_dir = temp_dir.path().join("out");

    let controller = Controller::with_config(Config::default())?;
    let outcomes = controller.extract_folder(&game, Some(&out_dir))?;

    assert_eq!(outcomes.len(), 2);

    let mapping_b = TokenMapping::from_json(&fs::read_to_string(out_dir.join("b_mapping.json"))?)?;
    assert_eq!(mapping_b.len(), 1);
    assert_eq!(mapping_b.get("@@1@@"), Some("[name]"));

    let protected_b = fs::read_to_string(out_dir.join("b_goc_protected.txt"))?;
    assert_eq!(protected_b, "1|||@@1@@\n");
    assert!(!out_dir.join("readme_dich.txt").exists());
    Ok(())
}

/// Scripts sharing a file name in different subdirectories keep separate outputs
#[test]
fn test_extract_folder_withSameStemInSubdirs_shouldMirrorLayoutUnderOutputDir() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let game = temp_dir.path().join("game");
    fs::create_dir_all(game.join("a"))?;
    fs::create_dir_all(game.join("b"))?;
    common::create_test_file(&game.join("a"), "script.rpy", "\"from a\"\n")?;
    common::create_test_file(&game.join("b"), "script.rpy", "\"from [b]\"\n")?;
    let out_dir = temp_dir.path().join("out");

    let controller = Controller::with_config(Config::default())?;
    let outcomes = controller.extract_folder(&game, Some(&out_dir))?;

    assert_eq!(outcomes.len(), 2);
    assert_ne!(outcomes[0].paths.untouched, outcomes[1].paths.untouched);

    assert_eq!(fs::read_to_string(out_dir.join("a").join("script_dich.txt"))?, "1|||from a\n");
    assert_eq!(fs::read_to_string(out_dir.join("b").join("script_dich.txt"))?, "1|||from [b]\n");

    let mapping_a = TokenMapping::from_json(&fs::read_to_string(out_dir.join("a").join("script_mapping.json"))?)?;
    let mapping_b = TokenMapping::from_json(&fs::read_to_string(out_dir.join("b").join("script_mapping.json"))?)?;
    assert!(mapping_a.is_empty());
    assert_eq!(mapping_b.get("@@1@@"), Some("[b]"));
    assert!(!out_dir.join("script_dich.txt").exists());
    Ok(())
}

/// Without an output directory, results are written next to each script
#[test]
fn test_extract_folder_withoutOutputDir_shouldWriteNextToScripts() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let chapter = temp_dir.path().join("chapter1");
    fs::create_dir(&chapter)?;
    common::create_sample_script(&chapter, "intro.rpy")?;

    let controller = Controller::with_config(Config::default())?;
    let outcomes = controller.extract_folder(temp_dir.path(), None)?;

    assert_eq!(outcomes.len(), 1);
    assert!(chapter.join("intro_dich.txt").exists());
    assert!(chapter.join("intro_goc_protected.txt").exists());
    assert!(chapter.join("intro_mapping.json").exists());
    Ok(())
}

/// A folder with no scripts is not an error
#[test]
fn test_extract_folder_withNoScripts_shouldReturnEmpty() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(Config::default())?;

    let outcomes = controller.extract_folder(temp_dir.path(), None)?;

    assert!(outcomes.is_empty());
    Ok(())
}

/// A folder that does not exist is an error
#[test]
fn test_extract_folder_withMissingDir_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(Config::default())?;

    assert!(controller.extract_folder(&temp_dir.path().join("nope"), None).is_err());
    Ok(())
}
