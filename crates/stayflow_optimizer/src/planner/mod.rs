pub mod itinerary;
pub mod planner_params;
