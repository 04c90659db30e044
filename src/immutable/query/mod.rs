mod nearest_one;
