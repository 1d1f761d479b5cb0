mod poker;
