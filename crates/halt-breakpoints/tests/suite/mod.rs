mod display;
mod round_trip;
