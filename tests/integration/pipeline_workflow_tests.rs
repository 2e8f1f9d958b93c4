/*!
 * End-to-end tests for the script-to-cues workflow, exercising the pieces
 * that need no external binaries or services
 */

use clipfab::app_config::{Config, SubtitleStyle};
use clipfab::app_controller::Controller;
use clipfab::pipeline::{PipelineSpec, Preset};
use clipfab::subtitle_track::SubtitleTrack;
use clipfab::timeline::{build_timeline, Script};

use crate::common::{clip_asset, create_temp_dir, image_assets};

#[test]
fn test_script_to_srt_workflow_should_produce_readable_cues() {
    let text = "The forest wakes slowly. Light filters through the canopy. Everything is waiting";
    let script = Script::from_text(text);
    assert_eq!(script.len(), 3);

    let mut assets = image_assets(2);
    assets.push(clip_asset("canopy", 3.0));
    let (entries, cues) = build_timeline(24.0, &script.sentences, &assets, None).unwrap();

    assert_eq!(entries.len(), 3);
    assert_eq!(entries.last().unwrap().end, 24.0);

    let temp_dir = create_temp_dir().unwrap();
    let srt_path = temp_dir.path().join("job").join("subtitles.srt");
    SubtitleTrack::from_cues(cues.clone()).write_to_srt(&srt_path).unwrap();

    let content = std::fs::read_to_string(&srt_path).unwrap();
    let parsed = SubtitleTrack::parse_srt_string(&content).unwrap();

    assert_eq!(parsed.len(), cues.len());
    assert_eq!(parsed[0].text, "The forest wakes slowly.");
    assert_eq!(parsed.last().unwrap().text, "Everything is waiting");
}

#[test]
fn test_every_preset_should_drive_a_valid_timeline() {
    for preset in Preset::all() {
        let spec = preset.spec();
        let mut assets = image_assets(spec.image_count);
        for i in 0..spec.clip_count {
            assets.push(clip_asset(&format!("{}_{}", spec.name, i), 5.0));
        }

        let sentences = vec![
            "A first sentence for the narration.".to_string(),
            "And a second one to close it out.".to_string(),
        ];
        let (entries, cues) = build_timeline(30.0, &sentences, &assets, None)
            .unwrap_or_else(|e| panic!("preset {} failed: {}", preset.id(), e));

        assert_eq!(entries.len(), spec.image_count + spec.clip_count);
        assert_eq!(entries.last().unwrap().end, 30.0);
        assert_eq!(cues.len(), 2);
    }
}

#[tokio::test]
async fn test_run_batch_with_scriptless_spec_should_report_every_failure() {
    let temp_dir = create_temp_dir().unwrap();
    let mut config = Config::default();
    config.providers.pexels.api_key = "test_key".to_string();
    config.directories.assets_dir = temp_dir.path().join("assets");
    config.directories.output_dir = temp_dir.path().join("output");

    let controller = Controller::new(config).unwrap();

    // No fixed script and no generation allowed, so each run fails before
    // touching any external service
    let spec = PipelineSpec {
        name: "no-script".to_string(),
        description: "Spec with nothing to narrate".to_string(),
        topic: "nothing".to_string(),
        search_query: "nothing".to_string(),
        script: None,
        voice: None,
        image_count: 1,
        clip_count: 0,
        style: SubtitleStyle::Professional,
        generate_script: false,
    };

    let outcomes = controller.run_batch(&spec, 2, false).await;

    assert_eq!(outcomes.len(), 2);
    for outcome in &outcomes {
        let err = outcome.as_ref().unwrap_err();
        assert!(err.to_string().contains("requires a script"));
    }
}

#[test]
fn test_config_written_to_disk_should_load_back_identically() {
    let temp_dir = create_temp_dir().unwrap();
    let path = temp_dir.path().join("conf.json");

    let mut config = Config::default();
    config.language = "de-DE".to_string();
    config.providers.pexels.api_key = "test_key".to_string();

    let json = serde_json::to_string_pretty(&config).unwrap();
    std::fs::write(&path, json).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded.language, "de-DE");
    assert_eq!(loaded.providers.pexels.api_key, "test_key");
    assert_eq!(loaded.render.fps, config.render.fps);
}
