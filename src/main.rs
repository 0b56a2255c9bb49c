fn main() -> anyhow::Result<()> {
    vr_pose_capture_lib::run()
}
