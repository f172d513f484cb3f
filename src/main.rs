fn main() -> eframe::Result {
    suzed::run_gui()
}
