pub mod wavetable;
