mod difference;
