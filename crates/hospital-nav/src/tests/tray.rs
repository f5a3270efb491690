use crate::tray_manager::{ICON_SIZE, icon_pixels, tooltip};

use hospital_nav_core::VoiceStage;

/// WHAT: Each stage gets a distinct opaque disc on a transparent square
/// WHY: Recording must be recognizable at a glance in the tray
#[test]
fn given_each_stage_when_drawing_icon_then_distinct_centre_colours() {
    // Given: All three stages
    let stages = [VoiceStage::Idle, VoiceStage::Recording, VoiceStage::Processing];

    // When: Drawing their icons
    let icons: Vec<_> = stages.iter().map(|s| icon_pixels(*s)).collect();

    // Then: Square, transparent corner, opaque and distinct centres
    let mid = ICON_SIZE / 2;
    for icon in &icons {
        assert_eq!(icon.dimensions(), (ICON_SIZE, ICON_SIZE));
        assert_eq!(icon.get_pixel(0, 0).0[3], 0);
        assert_eq!(icon.get_pixel(mid, mid).0[3], 255);
    }
    assert_ne!(icons[0].get_pixel(mid, mid), icons[1].get_pixel(mid, mid));
    assert_ne!(icons[1].get_pixel(mid, mid), icons[2].get_pixel(mid, mid));
}

/// WHAT: Tooltip names the current stage
/// WHY: Hovering the tray shows whether the app is listening
#[test]
fn given_recording_stage_when_building_tooltip_then_listening() {
    assert_eq!(tooltip(VoiceStage::Idle), "Hospital Navigator - Ready");
    assert!(tooltip(VoiceStage::Recording).contains("Listening"));
}
