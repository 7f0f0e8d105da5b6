fn main() {
    moodlens_lib::run()
}
